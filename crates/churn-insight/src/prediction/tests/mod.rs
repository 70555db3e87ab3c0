mod common;
mod encoder;
mod intake;
mod service;
