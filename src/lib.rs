// Fleet Packer - stateful vehicle telemetry normalization pipeline
// Copyright (C) 2026
// Licensed under AGPL v3

pub mod bounds;
pub mod config;
pub mod constants;
pub mod net;
pub mod pipeline;
pub mod reckoning;
pub mod resolver;
pub mod tracker;
