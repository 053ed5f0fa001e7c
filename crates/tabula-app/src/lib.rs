// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod ids;
pub mod model;
pub mod state;
pub mod table;

pub use ids::*;
pub use model::*;
pub use state::*;
pub use table::{PageInfo, Selection};
