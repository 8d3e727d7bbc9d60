pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use bbox::{prelude::*, Transform, XyXy, WH};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools as _;
pub use label::{DotaObject, Label, YoloLabel};
pub use log::{debug, info, warn};
pub use noisy_float::prelude::*;
pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    borrow::Cow,
    fmt,
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};
