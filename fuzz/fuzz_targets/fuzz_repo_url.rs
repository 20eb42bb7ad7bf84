// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use repograph::types::RepoRef;

fuzz_target!(|data: &str| {
    if let Ok(repo) = RepoRef::from_url(data) {
        assert!(!repo.owner.is_empty());
        assert!(!repo.name.is_empty());
    }
});
