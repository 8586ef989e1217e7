pub mod cli;
pub mod fit;
pub mod raster;
pub mod rotation;
pub mod surface;

pub use cli::Cli;
pub use fit::{fit_plane_along, polyfit, polyval, FitAxis};
pub use raster::{image_from_planes, planes_from_image};
pub use rotation::{fit_plane_at_angle, pad_reflect, rotate_plane, DEFAULT_MARGIN};
pub use surface::{eval_surface, fit_plane_surface, fit_surface};
