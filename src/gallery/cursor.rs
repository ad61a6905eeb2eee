use crate::youtube::types::VideoItem;

/// Pagination direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Next,
  Back,
}

/// Engine-owned view state. Not persisted; recreated on refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
  /// 1-based
  pub current_page: usize,
  pub page_count: usize,
  pub search_active: bool,
  pub last_search_results: Option<Vec<VideoItem>>,
  /// Cleared when the cursor moves, set once the page has been emitted.
  /// Pagination is ignored while it is false.
  pub render_complete: bool,
}

impl Default for PaginationCursor {
  fn default() -> Self {
    Self {
      current_page: 1,
      page_count: 0,
      search_active: false,
      last_search_results: None,
      render_complete: false,
    }
  }
}

impl PaginationCursor {
  /// Page one step in `direction`, or `None` at the boundary.
  pub fn step(&self, direction: Direction) -> Option<usize> {
    match direction {
      Direction::Next if self.current_page < self.page_count => Some(self.current_page + 1),
      Direction::Back if self.current_page > 1 => Some(self.current_page - 1),
      _ => None,
    }
  }

  /// `page` if it is in range and differs from the current page.
  pub fn jump(&self, page: usize) -> Option<usize> {
    (1..=self.page_count)
      .contains(&page)
      .then_some(page)
      .filter(|p| *p != self.current_page)
  }

  /// Keep the current page in range after `page_count` shrinks.
  pub fn clamp(&mut self) {
    if self.current_page > self.page_count.max(1) {
      self.current_page = self.page_count.max(1);
    }
  }

  pub fn clear_search(&mut self) {
    self.search_active = false;
    self.last_search_results = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cursor(current_page: usize, page_count: usize) -> PaginationCursor {
    PaginationCursor {
      current_page,
      page_count,
      ..Default::default()
    }
  }

  #[test]
  fn test_step_at_boundaries() {
    assert_eq!(cursor(1, 3).step(Direction::Back), None);
    assert_eq!(cursor(3, 3).step(Direction::Next), None);
    assert_eq!(cursor(1, 3).step(Direction::Next), Some(2));
    assert_eq!(cursor(3, 3).step(Direction::Back), Some(2));
  }

  #[test]
  fn test_step_with_no_pages() {
    assert_eq!(cursor(1, 0).step(Direction::Next), None);
    assert_eq!(cursor(1, 0).step(Direction::Back), None);
  }

  #[test]
  fn test_jump() {
    assert_eq!(cursor(1, 4).jump(4), Some(4));
    assert_eq!(cursor(1, 4).jump(1), None);
    assert_eq!(cursor(1, 4).jump(0), None);
    assert_eq!(cursor(1, 4).jump(5), None);
  }

  #[test]
  fn test_clamp() {
    let mut c = cursor(4, 2);
    c.clamp();
    assert_eq!(c.current_page, 2);

    let mut c = cursor(3, 0);
    c.clamp();
    assert_eq!(c.current_page, 1);
  }
}
