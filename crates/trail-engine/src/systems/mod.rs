pub mod spline;
