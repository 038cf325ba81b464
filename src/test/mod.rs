mod classify;
mod materialize;
