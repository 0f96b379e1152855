// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulator services: the loopback host that answers bridge calls, and the
// data directory holding the persisted parent origin.

pub mod data_dir;
pub mod loopback;
