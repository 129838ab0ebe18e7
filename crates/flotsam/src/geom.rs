#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Pos2 = euclid::Point2D<f64, Unit>;
pub type Vec2 = euclid::Vector2D<f64, Unit>;

pub fn pos2(x: f64, y: f64) -> Pos2 {
    euclid::point2(x, y)
}

pub fn vec2(x: f64, y: f64) -> Vec2 {
    euclid::vec2(x, y)
}
