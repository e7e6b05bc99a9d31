mod add_ellipsoid;
mod add_point;
mod add_surface;

pub use add_ellipsoid::AddEllipsoid;
pub use add_point::AddPoint;
pub use add_surface::AddSurface;
