use clap::ValueEnum;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum EntryFormat {
    Short,
    #[default]
    Full,
    Xarray,
    Json,
}

impl EntryFormat {
    pub(crate) const fn is_json(self) -> bool {
        matches!(self, EntryFormat::Xarray | EntryFormat::Json)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ListFormat {
    #[default]
    Short,
    Xarray,
    Json,
}

impl ListFormat {
    pub(crate) const fn is_json(self) -> bool {
        matches!(self, ListFormat::Xarray | ListFormat::Json)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ConfigFormat {
    #[default]
    Yaml,
    Json,
}
