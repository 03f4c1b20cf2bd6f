/// Vertex shader shared by particles and decorations
pub const MATERIAL_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;
out vec2 v_uv;

void main() {
    vec4 world_pos = u_model * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    // Uniform scale only, so the model matrix works for normals
    v_normal = mat3(u_model) * a_normal;
    v_uv = a_uv;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Metallic material with emissive glow and an optional photo texture
pub const MATERIAL_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;
in vec2 v_uv;

uniform vec3 u_camera_pos;
uniform vec3 u_color;
uniform vec3 u_emissive_color;
uniform float u_emissive;
uniform float u_metalness;
uniform float u_roughness;
uniform float u_opacity;
uniform bool u_unlit;
uniform bool u_use_texture;
uniform sampler2D u_texture;

out vec4 fragColor;

const vec3 GOLD = vec3(1.0, 0.843, 0.0);
const vec3 ORANGE = vec3(1.0, 0.333, 0.0);

vec3 light(vec3 normal, vec3 view_dir, vec3 light_dir, vec3 color, vec3 albedo) {
    float ndotl = max(dot(normal, light_dir), 0.0);
    vec3 half_dir = normalize(light_dir + view_dir);
    float shininess = mix(96.0, 8.0, u_roughness);
    float spec = pow(max(dot(normal, half_dir), 0.0), shininess);
    vec3 spec_color = mix(vec3(0.04), albedo, u_metalness);
    vec3 diffuse = albedo * (1.0 - u_metalness * 0.7) * ndotl;
    return (diffuse + spec_color * spec) * color;
}

void main() {
    vec3 albedo = u_color;
    if (u_use_texture) {
        albedo = texture(u_texture, v_uv).rgb;
    }

    if (u_unlit) {
        fragColor = vec4(albedo, u_opacity);
        return;
    }

    vec3 normal = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);
    if (!gl_FrontFacing) {
        normal = -normal;
    }

    // Ambient
    vec3 color = albedo * 0.5;

    // Core light inside the tree
    vec3 to_core = -v_world_position;
    float core_dist = length(to_core);
    float core_falloff = clamp(1.0 - core_dist / 20.0, 0.0, 1.0);
    color += light(normal, view_dir, to_core / max(core_dist, 0.001), GOLD * 2.0, albedo) * core_falloff;

    // Rim lights
    color += light(normal, view_dir, normalize(vec3(30.0, 20.0, 20.0)), GOLD * 1.5, albedo);
    color += light(normal, view_dir, normalize(vec3(-30.0, -10.0, 20.0)), ORANGE, albedo);

    // Fresnel sheen for the metallic look
    float rim = pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0);
    color += albedo * rim * u_metalness * 0.4;

    color += u_emissive_color * u_emissive;

    // Tone mapping
    color = color / (color + vec3(1.0));

    // Gamma correction
    color = pow(color, vec3(1.0 / 2.2));

    fragColor = vec4(color, u_opacity);
}
"#;
