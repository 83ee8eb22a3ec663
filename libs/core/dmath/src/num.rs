mod algebra;
mod elementary_fn;
mod elementwise;

pub use algebra::{Arithmetic, FloatBased, Numeric};
pub use elementary_fn::{
    Acos, Acosh, Asin, Asinh, Atan, Atanh, Cos, Cosh, Erf, Exp, Log, LogBase, Pow, Sin, Sinh, Sqrt,
    Tan, Tanh,
};
pub use elementwise::Elementwise;
