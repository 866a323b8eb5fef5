use super::*;

#[test]
fn new_image_is_transparent() {
    let img = Image::new(3, 2).unwrap();
    assert_eq!(img.data().len(), 3 * 2 * 4);
    assert!(img.data().iter().all(|&b| b == 0));
    assert_eq!(img.bounds(), BoxI::new(0, 0, 3, 2));
}

#[test]
fn from_premul_bytes_checks_length() {
    assert!(Image::from_premul_bytes(2, 2, vec![0; 15]).is_err());
    assert!(Image::from_premul_bytes(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn pixel_out_of_range_reads_transparent() {
    let mut img = Image::new(2, 2).unwrap();
    img.clear(Rgba8Premul {
        r: 1,
        g: 2,
        b: 3,
        a: 255,
    });
    assert_eq!(img.pixel(1, 1).to_array(), [1, 2, 3, 255]);
    assert_eq!(img.pixel(2, 0), Rgba8Premul::TRANSPARENT);
    assert_eq!(img.pixel(-1, 0), Rgba8Premul::TRANSPARENT);
}

#[test]
fn rgba_image_conversion_premultiplies_and_back() {
    let src = ::image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 200, 100, 50, 0]).unwrap();
    let img = Image::from_rgba_image(&src).unwrap();
    assert_eq!(img.pixel(0, 0).to_array(), [255, 0, 0, 255]);
    assert_eq!(img.pixel(1, 0).to_array(), [0, 0, 0, 0]);

    let back = img.to_rgba_image().unwrap();
    assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(back.get_pixel(1, 0).0, [0, 0, 0, 0]);
}
