//! Table grid cell lookup by row number and column name

use tracing::info;

use super::error::InteractionError;
use super::utility::Utility;
use super::wait::LONG_WAIT_MS;
use crate::bridge::{ElementAction, ElementState};
use crate::locator::Target;

pub const GRID_HEADER_SELECTOR: &str = r#"//table[@role="grid"]//tr/th[@style="touch-action: none;"]"#;

/// Index of the first header whose trimmed text equals the trimmed column name
pub fn find_column_index(headers: &[String], column_name: &str) -> Option<usize> {
    let wanted = column_name.trim();
    headers.iter().position(|h| h.trim() == wanted)
}

/// XPath of a body cell; `row` is 1-based, `column_index` 0-based, hidden cells skipped
pub fn grid_cell_selector(row: usize, column_index: usize) -> String {
    format!(
        "//table/tbody/tr[{}]/td[not(contains(@style, 'display:none'))][{}]",
        row,
        column_index + 1
    )
}

impl Utility {
    pub async fn get_table_grid_cell_text_by_row_and_column_name(
        &self,
        row_number: usize,
        column_name: &str,
        frame: Option<&str>,
    ) -> Result<String, InteractionError> {
        self.steps()
            .run(
                Self::title(
                    "getTableGridCellTextByRowAndColumnName",
                    Some("Get Table Grid Cell Text"),
                ),
                async {
                    self.wait_until_page_is_loaded().await;

                    let headers = Target::new(GRID_HEADER_SELECTOR)
                        .in_frame(frame.unwrap_or_default())
                        .timeout_ms(LONG_WAIT_MS);
                    let header_query = self.locate(&headers);
                    self.driver()
                        .wait_for(&header_query.first(), ElementState::Visible, LONG_WAIT_MS)
                        .await
                        .map_err(|e| self.driver_error(e, &headers))?;

                    let count = self
                        .driver()
                        .count(&header_query)
                        .await
                        .map_err(|e| self.driver_error(e, &headers))?;
                    let mut texts = Vec::with_capacity(count);
                    for i in 0..count {
                        let text = self
                            .driver()
                            .perform(&header_query.nth(i), &ElementAction::InnerText)
                            .await
                            .map_err(|e| self.driver_error(e, &headers))?;
                        texts.push(text.as_str().unwrap_or_default().to_string());
                    }

                    let index = find_column_index(&texts, column_name).ok_or_else(|| {
                        InteractionError::ColumnNotFound {
                            column: column_name.to_string(),
                            header_selector: GRID_HEADER_SELECTOR.to_string(),
                        }
                    })?;
                    info!("Column {} found at index {}", column_name, index);

                    let cell = Target::new(grid_cell_selector(row_number, index))
                        .in_frame(frame.unwrap_or_default());
                    let cell_query = self.locate(&cell).visible().first();
                    let text = self
                        .driver()
                        .perform(&cell_query, &ElementAction::InnerText)
                        .await
                        .map_err(|e| self.driver_error(e, &cell))?;
                    let text = text.as_str().unwrap_or_default().to_string();
                    info!("Cell [{}, {}] text is {}", row_number, column_name, text);
                    Ok(text)
                },
            )
            .await
    }
}
