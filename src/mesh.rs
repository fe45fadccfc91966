//! Triangle meshes and the point-in-solid parity test.
//!
//! A [`TriMesh`] is a plain triangle soup with a cached axis-aligned bounding
//! box. It has no rendering dependency, so the inside test used by the shape
//! sampler can be exercised directly in unit tests.
//!
//! # Parity rule
//!
//! A ray cast from a point crosses the surface of a closed solid an odd
//! number of times if and only if the point is inside. [`TriMesh::contains`]
//! counts crossings along a fixed direction with a Möller–Trumbore
//! ray/triangle test.

use glam::Vec3;

use crate::error::ResourceError;

/// Determinant threshold below which a ray counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-12;

/// Minimum hit distance. Hits at (or behind) the ray origin are ignored.
const HIT_EPSILON: f32 = 1e-7;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest box containing all points, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Box center.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Enclosed volume (zero for flat boxes).
    pub fn volume(&self) -> f32 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Whether `point` lies inside or on the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A half-line from `origin` along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction (need not be normalized).
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter `t` of the hit (in units of `direction`), or
/// `None` if the ray misses, runs parallel to the triangle, or the hit lies
/// at or behind the origin.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > HIT_EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Indexed triangle mesh with a cached bounding box.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bounds: Option<Aabb>,
}

impl TriMesh {
    /// Build a mesh from vertices and triangle indices.
    ///
    /// Fails if a triangle references a vertex that does not exist.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, ResourceError> {
        let count = vertices.len();
        if let Some(&index) = triangles
            .iter()
            .flatten()
            .find(|&&i| i as usize >= count)
        {
            return Err(ResourceError::IndexOutOfRange {
                index,
                vertices: count,
            });
        }
        Ok(Self::from_parts(vertices, triangles))
    }

    /// Indices must already be in range.
    fn from_parts(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let bounds = Aabb::from_points(
            triangles
                .iter()
                .flatten()
                .map(|&i| vertices[i as usize]),
        );
        Self {
            vertices,
            triangles,
            bounds,
        }
    }

    /// Closed box with outward-facing triangles.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let mut builder = MeshBuilder::default();
        let (a, b) = (min.min(max), min.max(max));
        let c = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
        // +Z / -Z
        builder.quad(c(a.x, a.y, b.z), c(b.x, a.y, b.z), c(b.x, b.y, b.z), c(a.x, b.y, b.z), 1);
        builder.quad(c(b.x, a.y, a.z), c(a.x, a.y, a.z), c(a.x, b.y, a.z), c(b.x, b.y, a.z), 1);
        // +X / -X
        builder.quad(c(b.x, a.y, b.z), c(b.x, a.y, a.z), c(b.x, b.y, a.z), c(b.x, b.y, b.z), 1);
        builder.quad(c(a.x, a.y, a.z), c(a.x, a.y, b.z), c(a.x, b.y, b.z), c(a.x, b.y, a.z), 1);
        // +Y / -Y
        builder.quad(c(a.x, b.y, b.z), c(b.x, b.y, b.z), c(b.x, b.y, a.z), c(a.x, b.y, a.z), 1);
        builder.quad(c(a.x, a.y, a.z), c(b.x, a.y, a.z), c(b.x, a.y, b.z), c(a.x, a.y, b.z), 1);
        builder.build()
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle vertex indices.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounding box of all referenced vertices, `None` when empty.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[index];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Number of surface crossings along `ray`.
    pub fn count_crossings(&self, ray: &Ray) -> usize {
        (0..self.triangles.len())
            .filter(|&i| {
                let [v0, v1, v2] = self.triangle(i);
                ray_triangle_intersect(ray, v0, v1, v2).is_some()
            })
            .count()
    }

    /// Parity point-in-solid test along `direction`.
    pub fn contains(&self, point: Vec3, direction: Vec3) -> bool {
        self.count_crossings(&Ray::new(point, direction)) % 2 == 1
    }

    /// Move the mesh so its bounding box is centered on the origin.
    pub fn center(&mut self) {
        if let Some(bounds) = self.bounds {
            self.translate(-bounds.center());
        }
    }

    /// Offset every vertex.
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
        if let Some(bounds) = &mut self.bounds {
            bounds.min += offset;
            bounds.max += offset;
        }
    }

    /// Per-vertex normals, averaged over the triangles sharing each vertex.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for i in 0..self.triangles.len() {
            let [v0, v1, v2] = self.triangle(i);
            // Area-weighted: the cross product length is twice the area.
            let n = (v1 - v0).cross(v2 - v0);
            for &idx in &self.triangles[i] {
                normals[idx as usize] += n;
            }
        }
        normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Z))
            .collect()
    }
}

/// Incremental builder that emits subdivided quads.
#[derive(Debug, Default)]
pub(crate) struct MeshBuilder {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl MeshBuilder {
    /// Append the parallelogram `a b c d` (counter-clockwise seen from the
    /// front) split into `segments x segments` cells.
    pub(crate) fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, segments: u32) {
        debug_assert!((a + c - b - d).length() < 1e-4, "quad is not a parallelogram");
        let segments = segments.max(1);
        let u = (b - a) / segments as f32;
        let v = (d - a) / segments as f32;
        let base = self.vertices.len() as u32;
        let row = segments + 1;

        for j in 0..=segments {
            for i in 0..=segments {
                self.vertices.push(a + u * i as f32 + v * j as f32);
            }
        }
        for j in 0..segments {
            for i in 0..segments {
                let p00 = base + j * row + i;
                let p10 = p00 + 1;
                let p01 = p00 + row;
                let p11 = p01 + 1;
                self.triangles.push([p00, p10, p11]);
                self.triangles.push([p00, p11, p01]);
            }
        }
    }

    pub(crate) fn build(self) -> TriMesh {
        TriMesh::from_parts(self.vertices, self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> TriMesh {
        TriMesh::cuboid(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn test_ray_hits_triangle() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        let t = ray_triangle_intersect(&ray, Vec3::ZERO, Vec3::X, Vec3::Y);
        assert!((t.unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_misses_behind_origin() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);
        assert!(ray_triangle_intersect(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.1, 0.0), Vec3::Z);
        // Triangle in the YZ plane, parallel to +Z.
        assert!(ray_triangle_intersect(&ray, Vec3::ZERO, Vec3::Z, Vec3::Y).is_none());
    }

    #[test]
    fn test_cuboid_is_closed_and_outward() {
        let cube = unit_cube();
        assert_eq!(cube.triangle_count(), 12);
        for n in cube.vertex_normals() {
            assert!(n.is_normalized());
        }
        // Every face normal points away from the center.
        for i in 0..cube.triangle_count() {
            let [a, b, c] = cube.triangle(i);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_parity_inside_outside() {
        let cube = unit_cube();
        assert!(cube.contains(Vec3::new(0.1, -0.2, 0.3), Vec3::Z));
        assert!(!cube.contains(Vec3::new(0.1, -0.2, -0.9), Vec3::Z));
        assert!(!cube.contains(Vec3::new(2.0, 0.0, 0.0), Vec3::Z));
        assert_eq!(
            cube.count_crossings(&Ray::new(Vec3::new(0.1, 0.2, -3.0), Vec3::Z)),
            2
        );
    }

    #[test]
    fn test_bounding_box_and_center() {
        let mut cube = TriMesh::cuboid(Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 4.0, 4.0));
        let bounds = cube.bounding_box().unwrap();
        assert_eq!(bounds.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.size(), Vec3::new(2.0, 2.0, 1.0));
        assert!((bounds.volume() - 4.0).abs() < 1e-6);

        cube.center();
        let centered = cube.bounding_box().unwrap();
        assert!(centered.center().length() < 1e-6);
        assert_eq!(centered.size(), Vec3::new(2.0, 2.0, 1.0));
    }

    #[test]
    fn test_subdivided_quad_keeps_winding() {
        let mut builder = MeshBuilder::default();
        builder.quad(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y, 3);
        let mesh = builder.build();
        assert_eq!(mesh.triangle_count(), 18);
        assert_eq!(mesh.vertices().len(), 16);
        for i in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(i);
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = TriMesh::new(Vec::new(), Vec::new()).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let result = TriMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 3]]);
        assert!(matches!(
            result,
            Err(ResourceError::IndexOutOfRange {
                index: 3,
                vertices: 3
            })
        ));
    }

    #[test]
    fn test_aabb_contains() {
        let bounds = Aabb::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(bounds.min, Vec3::ZERO);
        assert!(bounds.contains(Vec3::splat(0.5)));
        assert!(bounds.contains(Vec3::ONE));
        assert!(!bounds.contains(Vec3::splat(1.5)));
    }
}
