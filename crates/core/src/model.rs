/// A callable model that maps an input to an output.
///
/// Flexure kernels implement this trait with a [`PlateLoad`] input and a
/// deflection field output, which lets solvers stay independent of the
/// numerical method behind the kernel.
///
/// [`PlateLoad`]: crate::PlateLoad
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// Shared references to a model are models too.
impl<M: Model> Model for &M {
    type Input = M::Input;
    type Output = M::Output;
    type Error = M::Error;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        (**self).call(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    struct Doubler;

    impl Model for Doubler {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            Ok(2.0 * input)
        }
    }

    fn call_twice<M: Model<Input = f64, Output = f64>>(model: M, x: f64) -> f64 {
        let once = model.call(&x).unwrap();
        model.call(&once).unwrap()
    }

    #[test]
    fn reference_forwards_to_model() {
        let model = Doubler;
        assert_eq!(call_twice(&model, 1.5), 6.0);
        assert_eq!(call_twice(model, 1.0), 4.0);
    }
}
