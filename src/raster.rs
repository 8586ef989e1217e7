use image::{DynamicImage, Rgb, RgbImage};
use nalgebra::DMatrix;

/// Split an image into per-channel `f64` planes (rows x cols), RGB order.
pub fn planes_from_image(img: &DynamicImage) -> Vec<DMatrix<f64>> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    (0..3usize)
        .map(|c| {
            DMatrix::from_fn(height as usize, width as usize, |row, col| {
                rgb.get_pixel(col as u32, row as u32)[c] as f64
            })
        })
        .collect()
}

/// Reassemble RGB planes into an 8-bit image, clipping each value to [0, 255].
///
/// Planes must share dimensions and come in RGB order.
pub fn image_from_planes(planes: &[DMatrix<f64>]) -> RgbImage {
    assert_eq!(planes.len(), 3, "expected 3 RGB planes");
    let height = planes[0].nrows();
    let width = planes[0].ncols();

    let mut out = RgbImage::new(width as u32, height as u32);
    for row in 0..height {
        for col in 0..width {
            let pixel = [
                planes[0][(row, col)].round().clamp(0.0, 255.0) as u8,
                planes[1][(row, col)].round().clamp(0.0, 255.0) as u8,
                planes[2][(row, col)].round().clamp(0.0, 255.0) as u8,
            ];
            out.put_pixel(col as u32, row as u32, Rgb(pixel));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_preserves_shape_and_values() {
        let mut img = RgbImage::new(4, 3);
        img.put_pixel(2, 1, Rgb([10, 20, 30]));
        let planes = planes_from_image(&DynamicImage::ImageRgb8(img.clone()));

        assert_eq!(planes.len(), 3);
        assert_eq!(planes[0].shape(), (3, 4));
        assert_eq!(planes[1][(1, 2)], 20.0);

        let back = image_from_planes(&planes);
        assert_eq!(back, img);
    }

    #[test]
    fn test_out_of_range_values_are_clipped() {
        let planes = vec![
            DMatrix::from_element(2, 2, -40.5),
            DMatrix::from_element(2, 2, 300.0),
            DMatrix::from_element(2, 2, 127.4),
        ];
        let img = image_from_planes(&planes);
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 255, 127]));
    }
}
