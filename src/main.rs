use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use nalgebra::DMatrix;

use polypix::{
    fit_plane_along, fit_plane_at_angle, fit_plane_surface, image_from_planes,
    planes_from_image, Cli, FitAxis,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load input image
    let img = ImageReader::open(&cli.image)
        .with_context(|| format!("Failed to open input file: {:?}", cli.image))?
        .decode()
        .with_context(|| format!("Failed to decode image: {:?}", cli.image))?;

    let (width, height) = (img.width(), img.height());
    eprintln!("Loaded image: {:?} ({}x{}x3)", cli.image, width, height);

    let planes = planes_from_image(&img);

    // 2D surface mode wins over angle mode, which wins over the axis flag.
    let fitted: Vec<DMatrix<f64>> = if let Some(degree2d) = cli.degree2d {
        if cli.verbose {
            eprintln!(
                "Fitting 2D surface per channel: kx = ky = {} ({} coefficients)",
                degree2d,
                (degree2d + 1) * (degree2d + 1)
            );
        }
        planes
            .iter()
            .map(|plane| fit_plane_surface(plane, degree2d, degree2d, None))
            .collect::<Result<_>>()
            .context("2D surface fit failed")?
    } else if let Some(angle) = cli.angle {
        if cli.verbose {
            eprintln!(
                "Fitting rows at {}° with degree {} (pad margin {})",
                angle, cli.degree, cli.margin
            );
        }
        planes
            .iter()
            .map(|plane| fit_plane_at_angle(plane, cli.degree, angle as f64, cli.margin))
            .collect::<Result<_>>()
            .context("Angle-mode fit failed")?
    } else {
        let axis = if cli.yaxis { FitAxis::Y } else { FitAxis::X };
        if cli.verbose {
            eprintln!("Fitting along {:?} axis with degree {}", axis, cli.degree);
        }
        planes
            .iter()
            .map(|plane| fit_plane_along(plane, cli.degree, axis))
            .collect::<Result<_>>()
            .context("1D fit failed")?
    };

    // Clip to [0, 255] and cast back to 8-bit
    let output = image_from_planes(&fitted);

    let output_path = cli.output_path();
    output
        .save(&output_path)
        .with_context(|| format!("Failed to save output: {:?}", output_path))?;

    eprintln!("Saved reconstructed image: {:?}", output_path);

    Ok(())
}
