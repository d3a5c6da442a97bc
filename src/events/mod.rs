// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Event definitions decoded from receipt logs.

pub mod definitions;

pub use definitions::Transfer;
