// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Elle Project
// SPDX-FileName: crates/elle-compiler/src/lib.rs
// SPDX-FileType: SOURCE
// SPDX-License-Identifier: Apache-2.0
// -------------------------------------------------------------------------
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// -------------------------------------------------------------------------
//! Orchestration and external interface for the Elle compiler pipeline.
//!
//! This crate is the boundary between the `elle-ast`/`elle-passes`/`elle-ir`
//! core and everything that lives outside it: a real parser, a real LLVM-IR
//! emitter, a CLI. It owns the [`TranslationUnit`] and `Configuration`
//! shapes those external collaborators speak, and the [`Driver`] that
//! threads a unit through the 23-pass pipeline.

/// Version of the Elle compiler core.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod dom;
pub mod driver;
pub mod unit;

pub use config::MapConfiguration;
pub use driver::{BuildFile, Driver, PipelineOutput, TranslationUnitParser};
pub use unit::TranslationUnit;
