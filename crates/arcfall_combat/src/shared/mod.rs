//! Shared — cross-cutting helpers (векторная математика для aim и снарядов)

pub mod math;

pub use math::*;
