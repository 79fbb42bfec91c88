//! WGSL shader sources for the compute pipelines.
//!
//! Each kernel reads `src`, writes `dst` and copies alpha through. One
//! invocation handles one pixel; the dispatch grid may be two-dimensional, so
//! the pixel index is `id.y * row + id.x` with `row` threads per grid row.

#![cfg_attr(not(feature = "wgpu"), allow(dead_code))]

/// sRGB transfer. `dims.w` selects the direction: 0 decode, 1 encode.
pub const SRGB_TRANSFER: &str = r#"
@group(0) @binding(0) var<storage, read> src: array<f32>;
@group(0) @binding(1) var<storage, read_write> dst: array<f32>;
@group(0) @binding(2) var<uniform> dims: vec4<u32>;  // w, h, c, direction

fn eotf(v: f32) -> f32 {
    if v <= 0.04045 { return v / 12.92; }
    return pow((v + 0.055) / 1.055, 2.4);
}

fn oetf(l: f32) -> f32 {
    if l <= 0.0031308 { return l * 12.92; }
    return 1.055 * pow(l, 1.0 / 2.4) - 0.055;
}

@compute @workgroup_size(256)
fn main(
    @builtin(global_invocation_id) id: vec3<u32>,
    @builtin(num_workgroups) groups: vec3<u32>,
) {
    let px = id.y * groups.x * 256u + id.x;
    let total = dims.x * dims.y;
    if px >= total { return; }

    let c = dims.z;
    let base = px * c;

    for (var i = 0u; i < 3u; i = i + 1u) {
        let v = src[base + i];
        dst[base + i] = select(oetf(v), eotf(v), dims.w == 0u);
    }
    if c >= 4 { dst[base + 3] = src[base + 3]; }
}
"#;

/// 3x4 affine color transform: rows are (m0, m1, m2, offset).
pub const AFFINE: &str = r#"
struct AffineParams {
    row0: vec4<f32>,
    row1: vec4<f32>,
    row2: vec4<f32>,
}

@group(0) @binding(0) var<storage, read> src: array<f32>;
@group(0) @binding(1) var<storage, read_write> dst: array<f32>;
@group(0) @binding(2) var<uniform> dims: vec4<u32>;
@group(0) @binding(3) var<uniform> m: AffineParams;

@compute @workgroup_size(256)
fn main(
    @builtin(global_invocation_id) id: vec3<u32>,
    @builtin(num_workgroups) groups: vec3<u32>,
) {
    let px = id.y * groups.x * 256u + id.x;
    let total = dims.x * dims.y;
    if px >= total { return; }

    let c = dims.z;
    let base = px * c;

    let inp = vec4<f32>(src[base], src[base + 1], src[base + 2], 1.0);

    dst[base] = dot(m.row0, inp);
    dst[base + 1] = dot(m.row1, inp);
    dst[base + 2] = dot(m.row2, inp);
    if c >= 4 { dst[base + 3] = src[base + 3]; }
}
"#;

/// Oklab hue rotation. `rot.x` = cos, `rot.y` = sin.
pub const HUE_ROTATE: &str = r#"
@group(0) @binding(0) var<storage, read> src: array<f32>;
@group(0) @binding(1) var<storage, read_write> dst: array<f32>;
@group(0) @binding(2) var<uniform> dims: vec4<u32>;
@group(0) @binding(3) var<uniform> rot: vec4<f32>;

fn cbrt(x: f32) -> f32 {
    return sign(x) * pow(abs(x), 1.0 / 3.0);
}

fn to_oklab(c: vec3<f32>) -> vec3<f32> {
    let l = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
    let m = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
    let s = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;
    let l_ = cbrt(l);
    let m_ = cbrt(m);
    let s_ = cbrt(s);
    return vec3<f32>(
        0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
        1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
        0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
    );
}

fn from_oklab(lab: vec3<f32>) -> vec3<f32> {
    let l_ = lab.x + 0.3963377774 * lab.y + 0.2158037573 * lab.z;
    let m_ = lab.x - 0.1055613458 * lab.y - 0.0638541728 * lab.z;
    let s_ = lab.x - 0.0894841775 * lab.y - 1.2914855480 * lab.z;
    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;
    return vec3<f32>(
        4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    );
}

@compute @workgroup_size(256)
fn main(
    @builtin(global_invocation_id) id: vec3<u32>,
    @builtin(num_workgroups) groups: vec3<u32>,
) {
    let px = id.y * groups.x * 256u + id.x;
    let total = dims.x * dims.y;
    if px >= total { return; }

    let c = dims.z;
    let base = px * c;

    let lab = to_oklab(vec3<f32>(src[base], src[base + 1], src[base + 2]));
    let a = lab.y * rot.x - lab.z * rot.y;
    let b = lab.y * rot.y + lab.z * rot.x;
    let out = from_oklab(vec3<f32>(lab.x, a, b));

    dst[base] = out.r;
    dst[base + 1] = out.g;
    dst[base + 2] = out.b;
    if c >= 4 { dst[base + 3] = src[base + 3]; }
}
"#;
