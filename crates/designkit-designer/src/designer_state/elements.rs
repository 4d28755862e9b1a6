//! Element operations: add, update, delete, select, replace, reorder and duplicate.

use std::collections::HashSet;

use super::{DesignerError, DesignerState};
use crate::model::{CanvasElement, ElementPatch};

fn to_z(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl DesignerState {
    fn index_of(&self, id: &str) -> Result<usize, DesignerError> {
        self.elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| DesignerError::ElementNotFound(id.to_string()))
    }

    /// Highest paint order among elements, skipping `except`.
    fn top_z(&self, except: Option<usize>) -> Option<i64> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != except)
            .map(|(i, e)| e.effective_z_index(i))
            .max()
    }

    fn bottom_z(&self, except: Option<usize>) -> Option<i64> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != except)
            .map(|(i, e)| e.effective_z_index(i))
            .min()
    }

    pub(super) fn add_element(&mut self, mut element: CanvasElement) -> Result<(), DesignerError> {
        if self.contains(&element.id) {
            return Err(DesignerError::DuplicateId(element.id));
        }

        if element.z_index.is_none() {
            element.z_index = Some(self.top_z(None).map_or(0, |z| to_z(z + 1)));
        }

        self.history.record(self.elements.clone());
        self.selected_id = Some(element.id.clone());
        self.elements.push(element);
        self.touch();
        Ok(())
    }

    pub(super) fn update_element(
        &mut self,
        id: &str,
        patch: &ElementPatch,
    ) -> Result<(), DesignerError> {
        let index = self.index_of(id)?;
        let ignored = self.elements[index].apply_patch(patch);
        if !ignored.is_empty() {
            tracing::debug!(
                "UpdateElement {}: ignored fields {:?} for {} element",
                id,
                ignored,
                self.elements[index].element_type()
            );
        }
        self.touch();
        Ok(())
    }

    pub(super) fn delete_element(&mut self, id: &str) -> Result<(), DesignerError> {
        let index = self.index_of(id)?;
        self.history.record(self.elements.clone());
        self.elements.remove(index);
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }
        self.touch();
        Ok(())
    }

    pub(super) fn select_element(&mut self, id: Option<String>) -> Result<(), DesignerError> {
        match id {
            Some(id) => {
                self.index_of(&id)?;
                self.selected_id = Some(id);
            }
            None => self.selected_id = None,
        }
        Ok(())
    }

    pub(super) fn replace_all_elements(
        &mut self,
        elements: Vec<CanvasElement>,
    ) -> Result<(), DesignerError> {
        let mut seen = HashSet::new();
        for e in &elements {
            if !seen.insert(e.id.as_str()) {
                return Err(DesignerError::DuplicateId(e.id.clone()));
            }
        }

        self.history.record(std::mem::replace(&mut self.elements, elements));
        if let Some(id) = self.selected_id.as_deref() {
            if !self.contains(id) {
                self.selected_id = None;
            }
        }
        self.touch();
        Ok(())
    }

    pub(super) fn bring_to_front(&mut self, id: &str) -> Result<(), DesignerError> {
        let index = self.index_of(id)?;
        let current = self.elements[index].effective_z_index(index);
        let Some(top) = self.top_z(Some(index)) else {
            return Ok(());
        };
        if current > top {
            return Ok(());
        }

        self.history.record(self.elements.clone());
        self.elements[index].z_index = Some(to_z(top + 1));
        self.touch();
        Ok(())
    }

    pub(super) fn send_to_back(&mut self, id: &str) -> Result<(), DesignerError> {
        let index = self.index_of(id)?;
        let current = self.elements[index].effective_z_index(index);
        let Some(bottom) = self.bottom_z(Some(index)) else {
            return Ok(());
        };
        if current < bottom {
            return Ok(());
        }

        self.history.record(self.elements.clone());
        self.elements[index].z_index = Some(to_z(bottom - 1));
        self.touch();
        Ok(())
    }

    pub(super) fn duplicate_element(
        &mut self,
        id: &str,
        new_id: String,
        offset: (f64, f64),
    ) -> Result<(), DesignerError> {
        let index = self.index_of(id)?;
        if self.contains(&new_id) {
            return Err(DesignerError::DuplicateId(new_id));
        }

        let mut copy = self.elements[index].clone();
        copy.id = new_id;
        copy.x += offset.0;
        copy.y += offset.1;
        copy.z_index = Some(self.top_z(None).map_or(0, |z| to_z(z + 1)));

        self.history.record(self.elements.clone());
        self.selected_id = Some(copy.id.clone());
        self.elements.push(copy);
        self.touch();
        Ok(())
    }
}
