use thiserror::Error;

/// Represents always valid page request: zero-based page number and a non-zero page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("page size must be at least 1")]
pub struct PageSizeInvalidError;
impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 100;

    pub fn new(number: u32, size: u32) -> Result<Self, PageSizeInvalidError> {
        if size == 0 {
            Err(PageSizeInvalidError)
        } else {
            Ok(Self { number, size })
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of items that precede this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

/// One slice of an ordered result set together with its position in the whole.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    total_items: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_items,
            request,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn number(&self) -> u32 {
        self.request.number()
    }

    pub fn size(&self) -> u32 {
        self.request.size()
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(u64::from(self.request.size()))
    }
}


#[cfg(test)]
mod page_tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(0, 3).unwrap();
        let page = Page::new(vec![1, 2, 3], 7, request);

        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_total_pages_when_exact_multiple() {
        let request = PageRequest::new(1, 4).unwrap();
        let page = Page::new(vec![5, 6, 7, 8], 8, request);

        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), 4);
    }

    #[test]
    fn test_empty_result_has_no_pages() {
        let request = PageRequest::new(0, 10).unwrap();
        let page: Page<u8> = Page::new(Vec::new(), 0, request);

        assert_eq!(page.total_pages(), 0);
        assert!(page.items().is_empty());
    }
}
