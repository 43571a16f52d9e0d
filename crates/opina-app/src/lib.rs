// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod form;
pub mod ids;
pub mod model;
pub mod store;

pub use controller::*;
pub use form::*;
pub use ids::*;
pub use model::*;
pub use store::*;
