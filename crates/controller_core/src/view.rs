use crate::{controller::Controller, error::ViewError};

pub struct ViewContext<S, P> {
    controller: Option<Controller<S, P>>,
}

impl<S, P> ViewContext<S, P> {
    pub fn new(controller: Controller<S, P>) -> Self {
        Self {
            controller: Some(controller),
        }
    }

    pub fn detached() -> Self {
        Self { controller: None }
    }

    pub fn controller(&self) -> Result<&Controller<S, P>, ViewError> {
        self.controller.as_ref().ok_or(ViewError::MissingController)
    }
}

impl<S, P> Clone for ViewContext<S, P> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}
