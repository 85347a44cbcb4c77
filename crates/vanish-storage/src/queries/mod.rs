// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules over [`Database`](crate::Database).

pub mod meta;
pub mod rate_limits;
pub mod secrets;
