//! WGSL sources for the particle billboards and the lit new-year text.
//!
//! Both shaders share the same uniform block; its Rust mirror is
//! [`super::Uniforms`] and the two must stay in sync.

/// Maximum number of point lights uploaded per frame.
pub const MAX_LIGHTS: usize = 16;

/// Uniform block shared by both pipelines.
const UNIFORMS: &str = r#"
struct Light {
    position: vec3<f32>,
    intensity: f32,
    color: vec3<f32>,
    _pad: f32,
};

struct Uniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    camera_pos: vec3<f32>,
    light_count: u32,
    ambient: vec3<f32>,
    particle_size: f32,
    lights: array<Light, 16>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
"#;

const PARTICLE_BODY: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) particle_pos: vec3<f32>,
    @location(1) particle_color: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];

    // Billboard in view space so size attenuates with distance.
    var view_pos = uniforms.view * vec4<f32>(particle_pos, 1.0);
    view_pos.x += quad_pos.x * uniforms.particle_size * 0.5;
    view_pos.y += quad_pos.y * uniforms.particle_size * 0.5;

    var out: VertexOutput;
    out.clip_position = uniforms.proj * view_pos;
    out.color = particle_color;
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.8, 1.0, dist);
    return vec4<f32>(in.color, alpha);
}
"#;

const TEXT_BODY: &str = r#"
const BASE_COLOR: vec3<f32> = vec3<f32>(0.04, 0.04, 0.05);
const SPECULAR: f32 = 0.6;
const SHININESS: f32 = 48.0;
const PI: f32 = 3.14159265;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.world_pos = in.position;
    out.normal = in.normal;
    out.clip_position = uniforms.proj * uniforms.view * vec4<f32>(in.position, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let to_eye = normalize(uniforms.camera_pos - in.world_pos);
    var color = uniforms.ambient * BASE_COLOR;

    let count = min(uniforms.light_count, 16u);
    for (var i = 0u; i < count; i = i + 1u) {
        let light = uniforms.lights[i];
        let to_light = light.position - in.world_pos;
        let dist_sq = max(dot(to_light, to_light), 0.0001);
        let l = to_light * inverseSqrt(dist_sq);
        // Inverse-square falloff.
        let radiance = light.color * light.intensity / dist_sq;

        let n_dot_l = max(dot(n, l), 0.0);
        let h = normalize(l + to_eye);
        let spec = SPECULAR * pow(max(dot(n, h), 0.0), SHININESS);
        color += radiance * n_dot_l * (BASE_COLOR / PI + spec);
    }

    // Reinhard keeps very bright lights from clipping to flat white.
    let mapped = color / (vec3<f32>(1.0) + color);
    return vec4<f32>(mapped, 1.0);
}
"#;

/// Shader for camera-facing particle discs.
pub fn particle_shader() -> String {
    format!("{UNIFORMS}{PARTICLE_BODY}")
}

/// Shader for the lit text mesh.
pub fn text_shader() -> String {
    format!("{UNIFORMS}{TEXT_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source).expect("WGSL parse failed");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .expect("WGSL validation failed");
        module
    }

    #[test]
    fn test_particle_shader_is_valid() {
        let module = validate(&particle_shader());
        let entries: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entries.contains(&"vs_main"));
        assert!(entries.contains(&"fs_main"));
    }

    #[test]
    fn test_text_shader_is_valid() {
        validate(&text_shader());
    }

    #[test]
    fn test_light_array_matches_rust_limit() {
        assert!(UNIFORMS.contains(&format!("array<Light, {}>", MAX_LIGHTS)));
    }
}
