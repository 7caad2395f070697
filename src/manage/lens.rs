/// Typed accessor for one field of a document, in place of dotted string paths.
///
/// Build one with the `field!` macro: `field!(HeroDocument, hero.headline.text_normal)`.
pub struct Field<D, T> {
    path: &'static str,
    get: fn(&D) -> &T,
    get_mut: fn(&mut D) -> &mut T,
}

impl<D, T> Field<D, T> {
    pub fn new(path: &'static str, get: fn(&D) -> &T, get_mut: fn(&mut D) -> &mut T) -> Self {
        Field { path, get, get_mut }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn get<'a>(&self, doc: &'a D) -> &'a T {
        (self.get)(doc)
    }

    pub fn get_mut<'a>(&self, doc: &'a mut D) -> &'a mut T {
        (self.get_mut)(doc)
    }

    pub fn set(&self, doc: &mut D, value: T) {
        *(self.get_mut)(doc) = value;
    }
}

impl<D, T> Clone for Field<D, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, T> Copy for Field<D, T> {}

impl<D, T> std::fmt::Debug for Field<D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Field").field(&self.path).finish()
    }
}

#[macro_export]
macro_rules! field {
    ($doc:ty, $($path:ident).+) => {
        $crate::manage::lens::Field::new(
            stringify!($($path).+),
            |d: &$doc| &d.$($path).+,
            |d: &mut $doc| &mut d.$($path).+,
        )
    };
}
