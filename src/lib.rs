// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod error;
pub mod evaluator;
pub mod mirror;
pub mod models;
pub mod monthkey;
pub mod remote;
pub mod session;
pub mod summary;
pub mod utils;
