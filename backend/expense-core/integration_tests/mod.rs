mod client;
mod helpers;
mod sync;
