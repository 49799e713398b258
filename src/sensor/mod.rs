pub mod ov2640;
