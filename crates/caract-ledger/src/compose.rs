use caract_types::{LedgerRow, Mode, SessionHeader, Taxonomy, ValidationError, WeightEntry};

/// Turns a header and a sparse weight map into a fixed-order [`LedgerRow`].
///
/// Composition is pure: no I/O, and the output depends only on the taxonomy
/// order, never on the order weights were entered in.
#[derive(Clone, Copy, Debug)]
pub struct RowComposer<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> RowComposer<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn compose(
        &self,
        mode: Mode,
        header: &SessionHeader,
        weights: &WeightEntry,
    ) -> Result<LedgerRow, ValidationError> {
        if let Some(unknown) = weights
            .materials()
            .find(|m| !self.taxonomy.contains(mode, m))
        {
            return Err(ValidationError::UnknownMaterial {
                mode,
                material: unknown.to_string(),
            });
        }

        let ordered = self
            .taxonomy
            .ordered_materials(mode)
            .into_iter()
            .map(|material| weights.weight(material))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LedgerRow::new(mode, header.cells(mode), ordered))
    }
}
