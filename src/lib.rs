/*
Pip Gauge - by David Petnick
*/
pub mod gauge;
pub mod preset;
