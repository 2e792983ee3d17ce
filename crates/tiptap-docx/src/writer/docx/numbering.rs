//! List numbering management for DOCX conversion

use std::collections::HashMap;

use docx_rs::*;
use log::debug;

use crate::converter::NumberingRef;
use crate::numbering::{LIST_HANGING, LIST_INDENT, NumberingDefinition};

/// Maps the references of synthesized definitions to numbering ids.
#[derive(Clone, Debug, Default)]
pub struct DocxNumbering {
    ids: HashMap<String, usize>,
}

impl DocxNumbering {
    /// Create a list level with the specified parameters
    fn create_list_level(definition: &NumberingDefinition) -> Level {
        Level::new(
            definition.level as usize,
            Start::new(definition.start as usize),
            NumberFormat::new(definition.format.as_str()),
            LevelText::new(definition.format.text()),
            LevelJc::new("left"),
        )
        .indent(
            Some(LIST_INDENT),
            Some(SpecialIndentType::Hanging(LIST_HANGING)),
            None,
            None,
        )
    }

    /// Registers every definition, each with its own abstract numbering.
    /// Ids are assigned from 1 in definition order.
    pub fn initialize_numbering(&mut self, mut docx: Docx, definitions: &[NumberingDefinition]) -> Docx {
        for (index, definition) in definitions.iter().enumerate() {
            let id = index + 1;
            let abstract_numbering =
                AbstractNumbering::new(id).add_level(Self::create_list_level(definition));
            docx = docx
                .add_abstract_numbering(abstract_numbering)
                .add_numbering(Numbering::new(id, id));
            self.ids.insert(definition.reference.clone(), id);
        }
        docx
    }

    /// Attaches the numbering of a list paragraph.
    pub fn apply(&self, para: Paragraph, numbering: &NumberingRef) -> Paragraph {
        match self.ids.get(&numbering.reference) {
            Some(&id) => para.numbering(
                NumberingId::new(id),
                IndentLevel::new(numbering.level as usize),
            ),
            None => {
                debug!("no numbering definition for `{}`", numbering.reference);
                para
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::DocumentNode;
    use crate::numbering::synthesize_numbering;

    #[test]
    fn ids_follow_definition_order() {
        let tree = DocumentNode::from_json(
            r#"{ "type": "doc", "content": [
                { "type": "orderedList", "attrs": { "start": 7 } },
                { "type": "orderedList", "attrs": { "start": 3 } }
            ] }"#,
        )
        .unwrap();

        let mut numbering = DocxNumbering::default();
        let _ = numbering.initialize_numbering(Docx::new(), &synthesize_numbering(&tree));

        let id = |reference: &str| numbering.ids.get(reference).copied();
        assert_eq!(id("bullet-list"), Some(1));
        assert_eq!(id("ordered-list"), Some(2));
        assert_eq!(id("ordered-list-start-7"), Some(3));
        assert_eq!(id("ordered-list-start-3"), Some(4));
    }
}
