// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod archive;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod layout;
pub mod locate;
pub mod lock;
pub mod models;
pub mod prefs;
pub mod protocol;
pub mod rates;
pub mod router;
pub mod server;
pub mod service;
pub mod summary;
pub mod utils;
pub mod years;
