use crate::youtube::types::VideoItem;

/// Consumer of engine output.
///
/// The engine never renders anything itself; it reports pages, search
/// results, failures and loading transitions through this trait.
pub trait RenderSink {
  /// A display page is ready. `page_number` is 1-based.
  fn on_page_ready(&mut self, items: &[VideoItem], page_number: usize, page_count: usize);

  /// A search matched; pagination is suspended until the search is cleared.
  fn on_search_results(&mut self, items: &[VideoItem]);

  /// The current build failed. Only a refresh recovers.
  fn on_error(&mut self, code: &str, message: &str);

  /// A build started, or the requested page is still being fetched.
  /// Served output should be cleared.
  fn on_loading_start(&mut self);

  /// The build finished or failed.
  fn on_loading_end(&mut self);
}
