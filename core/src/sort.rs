// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Natural, case-insensitive ordering for device lists

use core::{cmp::Ordering, iter::Peekable, str::Chars};

use crate::device::CandidateDevice;

/// Compare two strings naturally, ignoring case.
///
/// Digit runs compare by numeric value so `Pro 2` sorts before `Pro 10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.chars().peekable(), b.chars().peekable());

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (na, nb) = (take_digits(&mut a), take_digits(&mut b));
                match cmp_digits(&na, &nb) {
                    Ordering::Equal => (),
                    o => return o,
                }
            }
            (Some(x), Some(y)) => {
                a.next();
                b.next();

                match x.to_lowercase().cmp(y.to_lowercase()) {
                    Ordering::Equal => (),
                    o => return o,
                }
            }
        }
    }
}

fn take_digits(s: &mut Peekable<Chars>) -> String {
    let mut d = String::new();
    while let Some(c) = s.next_if(|c| c.is_ascii_digit()) {
        d.push(c);
    }
    d
}

/// Compare digit runs by value without parsing (runs may exceed any integer width)
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Stable-sort candidates by [CandidateDevice::sort_key] using [natural_cmp]
pub fn sort_candidates(devices: &mut [CandidateDevice]) {
    devices.sort_by(|a, b| natural_cmp(a.sort_key(), b.sort_key()));
}
