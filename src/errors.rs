// ABOUTME: Error types for the progress analytics service
// ABOUTME: Re-exports the unified AppError system and domain errors from progress-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use progress_core::errors::*;
