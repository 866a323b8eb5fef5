use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
    assert_eq!(mul_div255_u8(255, 255), 255);
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(2.0), 255);
}

#[test]
fn over_opaque_source_replaces_destination() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over_px(dst, [200, 0, 0, 255], 255), [200, 0, 0, 255]);
    assert_eq!(over_px(dst, [200, 0, 0, 255], 0), dst);
}

#[test]
fn over_half_coverage_blends() {
    let out = over_px([0, 0, 0, 255], [255, 255, 255, 255], 128);
    assert_eq!(out, [128, 128, 128, 255]);
}

#[test]
fn copy_replaces_including_alpha() {
    assert_eq!(copy_px([9, 9, 9, 255], [0, 0, 0, 0], 255), [0, 0, 0, 0]);
    assert_eq!(copy_px([9, 9, 9, 255], [0, 0, 0, 0], 0), [9, 9, 9, 255]);
}

#[test]
fn lerp_endpoints() {
    let a = [0, 50, 100, 255];
    let b = [255, 150, 0, 0];
    assert_eq!(lerp_px(a, b, 0), a);
    assert_eq!(lerp_px(a, b, 255), b);
}
