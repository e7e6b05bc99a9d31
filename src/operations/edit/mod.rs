mod move_control_point;
mod move_point;
mod remove_object;
mod resize_ellipsoid;
mod translate_object;

pub use move_control_point::MoveControlPoint;
pub use move_point::MovePoint;
pub use remove_object::RemoveObject;
pub use resize_ellipsoid::ResizeEllipsoid;
pub use translate_object::TranslateObject;
