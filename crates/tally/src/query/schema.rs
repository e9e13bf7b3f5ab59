// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::config::SchemaConcept;
use crate::error::QueryError;

/// Rejects questions about a concept the dataset has no column for.
pub struct SchemaGuard<'a> {
    concepts: &'a [SchemaConcept],
}

impl<'a> SchemaGuard<'a> {
    pub fn new(concepts: &'a [SchemaConcept]) -> Self {
        Self { concepts }
    }

    /// Concepts are checked in order; the first one mentioned in the
    /// question but absent from `columns` is reported.
    pub fn check(&self, question: &str, columns: &[String]) -> Result<(), QueryError> {
        let question = question.to_lowercase();
        for concept in self.concepts {
            let synonyms: Vec<String> = concept.synonyms.iter().map(|s| s.to_lowercase()).collect();
            if !synonyms.iter().any(|s| question.contains(s.as_str())) {
                continue;
            }
            let covered = columns.iter().any(|column| {
                let column = column.to_lowercase();
                synonyms.iter().any(|s| column.contains(s.as_str()))
            });
            if !covered {
                return Err(QueryError::SchemaConceptMissing {
                    concept: concept.name.clone(),
                    available: columns.to_vec(),
                });
            }
        }
        Ok(())
    }
}
