// Monte Carlo alliance simulation: normal variates, trial loop, histogram.

pub mod alliance;
pub mod histogram;
pub mod variate;
