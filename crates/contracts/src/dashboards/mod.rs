// Dashboard contracts (d410-d415)
pub mod d410_registrations;
pub mod d411_sales;
pub mod d412_sr_performance;
pub mod d413_drivers;
pub mod d414_csr;
pub mod d415_packing;
