// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod currency;
pub mod doctor;
pub mod exporter;
pub mod fx;
pub mod importer;
pub mod receipt;
pub mod reports;
pub mod transactions;
