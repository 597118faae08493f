mod support;
mod sync;
