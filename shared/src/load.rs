//! 页面数据加载状态: Loading -> {Failed | Loaded}

use crate::error::ApiResult;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> LoadState<T> {
    pub fn from_result(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => LoadState::Loaded(data),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_from_result() {
        let loaded = LoadState::from_result(Ok(vec![1, 2]));
        assert_eq!(loaded.data(), Some(&vec![1, 2]));
        assert!(loaded.error().is_none());

        let failed: LoadState<Vec<i32>> =
            LoadState::from_result(Err(ApiError::Network("offline".to_string())));
        assert_eq!(failed.error(), Some("network error: offline"));
        assert!(failed.data().is_none());
    }

    #[test]
    fn test_default_is_loading() {
        let mut state = LoadState::<Vec<i32>>::default();
        assert!(state.is_loading());
        assert!(state.data_mut().is_none());
    }
}
