// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
pub mod mmio_map;

pub use mmio_map::PageTableMapper;
