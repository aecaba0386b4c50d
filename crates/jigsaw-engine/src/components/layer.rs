/// Draw layer. Controls paint order within a frame.
///
/// The solved-area guide is always painted first; after it come locked
/// pieces, then loose pieces. Within `Loose`, pick order decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DrawLayer {
    Locked,
    #[default]
    Loose,
}
