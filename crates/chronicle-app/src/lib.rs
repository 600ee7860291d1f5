// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

pub mod ids;
pub mod model;
pub mod readtime;
pub mod search;
pub mod segment;
pub mod state;

pub use ids::*;
pub use model::*;
pub use readtime::*;
pub use search::*;
pub use segment::*;
pub use state::*;
