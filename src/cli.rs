use clap::Parser;
use std::path::PathBuf;

use crate::rotation::DEFAULT_MARGIN;

#[derive(Parser, Debug)]
#[command(name = "polypix")]
#[command(version, about = "Approximate an image with polynomial fits and reconstruct it")]
pub struct Cli {
    /// Relative path to input image
    #[arg(short, long, default_value = "../data/dog.bmp")]
    pub image: PathBuf,

    /// Degree of polynomial to fit each row or column to
    #[arg(short, long, default_value = "16")]
    pub degree: usize,

    /// Fit along columns (y-axis) instead of rows
    #[arg(short, long)]
    pub yaxis: bool,

    /// Fit a 2D polynomial surface of the given degree instead of 1D curves
    #[arg(long)]
    pub degree2d: Option<usize>,

    /// Fit rows after rotating the image by this angle in degrees
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=180))]
    pub angle: Option<u32>,

    /// Reflection-pad margin (pixels) used by angle mode
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: usize,

    /// Show fitting details
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// The degree encoded in the output filename: the surface degree in 2D
    /// mode, the 1D degree otherwise.
    pub fn effective_degree(&self) -> usize {
        self.degree2d.unwrap_or(self.degree)
    }

    /// Output path: `../output/<stem>_<degree>[_y][_2d][_<angle>deg].png`.
    ///
    /// 2D mode takes precedence over angle mode, matching the dispatch order
    /// in `main`. Existing files are silently overwritten.
    pub fn output_path(&self) -> PathBuf {
        let stem = self.image.file_stem().unwrap_or_default().to_string_lossy();
        let mut name = format!("{}_{}", stem, self.effective_degree());

        if self.degree2d.is_some() {
            name.push_str("_2d");
        } else if let Some(angle) = self.angle {
            name.push_str(&format!("_{}deg", angle));
        } else if self.yaxis {
            name.push_str("_y");
        }

        PathBuf::from("../output").join(format!("{}.png", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("polypix").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_filename() {
        let cli = cli(&["-i", "data/dog.bmp"]);
        assert_eq!(cli.output_path(), PathBuf::from("../output/dog_16.png"));
    }

    #[test]
    fn test_yaxis_filename() {
        let cli = cli(&["-i", "cat.bmp", "-d", "5", "-y"]);
        assert_eq!(cli.output_path(), PathBuf::from("../output/cat_5_y.png"));
    }

    #[test]
    fn test_2d_filename_uses_surface_degree() {
        let cli = cli(&["-i", "cat.bmp", "--degree2d", "3"]);
        assert_eq!(cli.output_path(), PathBuf::from("../output/cat_3_2d.png"));
    }

    #[test]
    fn test_angle_filename() {
        let cli = cli(&["-i", "cat.bmp", "-a", "45"]);
        assert_eq!(cli.output_path(), PathBuf::from("../output/cat_16_45deg.png"));
    }

    #[test]
    fn test_2d_takes_precedence_over_angle() {
        let cli = cli(&["-i", "cat.bmp", "--degree2d", "3", "-a", "45"]);
        assert_eq!(cli.output_path(), PathBuf::from("../output/cat_3_2d.png"));
    }

    #[test]
    fn test_angle_out_of_range_rejected() {
        let result = Cli::try_parse_from(["polypix", "-a", "181"]);
        assert!(result.is_err());
    }
}
