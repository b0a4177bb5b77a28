// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use fotoexpres_domain::OrderNumber;

const SUFFIX_MIN: u32 = 100_000;
const SUFFIX_SPAN: u32 = 900_000;

/// Generates a random order number in `ORD-100000..=ORD-999999`.
///
/// Uniqueness is not checked here; callers retry on collision.
///
/// # Errors
///
/// Never fails in practice; the generated suffix always has six digits.
pub fn generate_order_number() -> Result<OrderNumber, CoreError> {
    let suffix: u32 = SUFFIX_MIN + rand::random::<u32>() % SUFFIX_SPAN;
    Ok(OrderNumber::from_suffix(suffix)?)
}
