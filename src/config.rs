use crate::core::Module;
use regex::Regex;

/// Options for [crate::decode::decode_module_with].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 0 logs nothing per section, 1 logs every section, 2 and above also
    /// logs every entry.
    pub verbosity: u8,
    /// When false the Code section is skipped and [Module::codes] stays
    /// empty.
    pub read_code: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbosity: 0,
            read_code: true,
        }
    }
}

/// Selects defined functions by name pattern or by a byte offset inside
/// their body. An empty filter selects every function.
#[derive(Debug, Clone, Default)]
pub struct FunctionFilter {
    pub name: Option<Regex>,
    pub offset: Option<u64>,
}

impl FunctionFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.offset.is_none()
    }

    /// Whether the defined function `idx` of `module` is selected.
    ///
    /// A function whose body contains the offset is always selected. The
    /// name pattern only applies when the module carries function names.
    pub fn matches(&self, module: &Module, idx: u32) -> bool {
        if self.is_empty() {
            return true;
        }

        if let Some(offset) = self.offset
            && module
                .codes
                .get(idx as usize)
                .is_some_and(|code| code.contains(offset))
        {
            return true;
        }

        match &self.name {
            Some(re) if !module.names.functions.is_empty() => {
                re.is_match(&module.function_name(idx))
            }
            _ => false,
        }
    }
}

impl Module {
    /// Defined indices of the functions selected by `filter`, in order.
    pub fn filter_functions(&self, filter: &FunctionFilter) -> Vec<u32> {
        (0..self.functions.len() as u32)
            .filter(|&idx| filter.matches(self, idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Code;
    use crate::core::indices::TypeIdx;

    fn module() -> Module {
        let mut module = Module::default();
        module.functions = vec![TypeIdx(0); 3];
        for (index, offset) in [(0, 10), (1, 20), (2, 30)] {
            module.codes.push(Code {
                index,
                size: 10,
                offset,
                ..Default::default()
            });
        }
        module
    }

    #[test]
    fn empty_filter_selects_everything() {
        assert_eq!(module().filter_functions(&FunctionFilter::default()), [0, 1, 2]);
    }

    #[test]
    fn offset_selects_containing_body() {
        let filter = FunctionFilter {
            offset: Some(29),
            ..Default::default()
        };
        assert_eq!(module().filter_functions(&filter), [1]);
    }

    #[test]
    fn name_requires_name_section() {
        let filter = FunctionFilter {
            name: Regex::new("^ma").ok(),
            offset: None,
        };
        let mut module = module();
        assert!(module.filter_functions(&filter).is_empty());

        module.names.functions.insert(2, "main".to_string());
        module.names.functions.insert(0, "malloc".to_string());
        assert_eq!(module.filter_functions(&filter), [0, 2]);
    }
}
