// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Middleware transform pipeline: context, transforms, and the builder that
//! assembles them around a handler.

pub mod builder;
pub mod context;
pub mod transform;

pub use builder::CommandBuilder;
pub use context::{MiddlewareContext, LARGE_DATA_THRESHOLD};
pub use transform::{large_data_placeholder, ArgTransform, FifoMode, Phase};
