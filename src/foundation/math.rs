pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Map a `[0, 1]` factor to `0..=255`.
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    ((v.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

/// Premultiplied source-over of one pixel, `src` pre-scaled by `cov` (0..=255).
pub(crate) fn over_px(dst: [u8; 4], src: [u8; 4], cov: u8) -> [u8; 4] {
    if cov == 0 || src[3] == 0 {
        return dst;
    }
    let cov = u16::from(cov);
    let sa = mul_div255_u16(u16::from(src[3]), cov);
    let inv = 255 - sa;
    let mut out = [0u8; 4];
    for i in 0..4 {
        let sc = mul_div255_u16(u16::from(src[i]), cov);
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = (sc + dc).min(255) as u8;
    }
    out
}

/// Premultiplied source-copy: lerp from `dst` towards `src` by `cov`.
pub(crate) fn copy_px(dst: [u8; 4], src: [u8; 4], cov: u8) -> [u8; 4] {
    if cov == 0 {
        return dst;
    }
    if cov == 255 {
        return src;
    }
    lerp_px(dst, src, cov)
}

pub(crate) fn lerp_px(a: [u8; 4], b: [u8; 4], t: u8) -> [u8; 4] {
    let t = u16::from(t);
    let it = 255 - t;
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = mul_div255_u16(u16::from(a[i]), it) + mul_div255_u16(u16::from(b[i]), t);
        out[i] = v.min(255) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
