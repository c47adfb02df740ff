//! Incremental document assembly.
//!
//! The builder keeps one record per open container on an explicit stack. The
//! bottom record is the top-level slot; each object or array start pushes a
//! record and each end pops it. A closing container is packed immediately:
//! its header and entries are written to a fresh buffer, its entries are
//! dropped, and the resulting bytes are installed as a
//! [`Scalar::PreEncoded`] value in the parent's pending slot. Memory held by
//! the builder is therefore bounded by the open path through the document,
//! not by the document size, and no closed container is walked twice.

use tracing::trace;

use crate::{
    EncoderOptions, Error, EventSink, StructuralEvent,
    packer::{Packer, Scalar},
};

#[derive(Debug)]
struct Field {
    key: String,
    value: Option<Scalar>,
}

#[derive(Debug)]
enum Container {
    TopLevel { value: Option<Scalar> },
    Object { fields: Vec<Field> },
    Array { elements: Vec<Option<Scalar>> },
}

impl Container {
    fn name(&self) -> &'static str {
        match self {
            Container::TopLevel { .. } => "top level",
            Container::Object { .. } => "object",
            Container::Array { .. } => "array",
        }
    }

    /// The slot the next value is assigned to.
    fn pending_slot(&mut self) -> Result<&mut Option<Scalar>, Error> {
        match self {
            Container::TopLevel { value } => Ok(value),
            Container::Object { fields } => fields
                .last_mut()
                .map(|field| &mut field.value)
                .ok_or(Error::StructuralMismatch("object value without a field name")),
            Container::Array { elements } => elements
                .last_mut()
                .ok_or(Error::StructuralMismatch("array value without an element start")),
        }
    }

    fn pack(self) -> Result<Vec<u8>, Error> {
        let mut packer = Packer::new();
        match self {
            Container::Object { fields } => {
                packer.pack_map_header(fields.len())?;
                for field in fields {
                    packer.pack_str(&field.key)?;
                    packer.pack_scalar(&assigned(field.value)?)?;
                }
            }
            Container::Array { elements } => {
                packer.pack_array_header(elements.len())?;
                for element in elements {
                    packer.pack_scalar(&assigned(element)?)?;
                }
            }
            Container::TopLevel { value } => packer.pack_scalar(&assigned(value)?)?,
        }
        Ok(packer.into_inner())
    }
}

fn assigned(slot: Option<Scalar>) -> Result<Scalar, Error> {
    slot.ok_or(Error::StructuralMismatch("slot closed without a value"))
}

/// Builds MessagePack bytes from a stream of [`StructuralEvent`]s.
///
/// # Examples
///
/// ```
/// use jsonmsgpack::{EventSink, StructuralEvent, TokenKind, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder.event(StructuralEvent::ArrayStart).unwrap();
/// builder.event(StructuralEvent::ElementStart).unwrap();
/// builder
///     .event(StructuralEvent::Scalar {
///         token: "1".to_string(),
///         kind: TokenKind::Number,
///     })
///     .unwrap();
/// builder.event(StructuralEvent::ArrayEnd).unwrap();
/// assert_eq!(builder.finish().unwrap(), [0x91, 0x01]);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    stack: Vec<Container>,
    max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a builder that accepts up to
    /// [`EncoderOptions::DEFAULT_MAX_DEPTH`] nested containers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_depth(EncoderOptions::DEFAULT_MAX_DEPTH)
    }

    /// Creates a builder that rejects more than `max_depth` simultaneously
    /// open containers.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: vec![Container::TopLevel { value: None }],
            max_depth,
        }
    }

    /// Number of objects and arrays currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Packs the document root into the final output buffer.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StructuralMismatch`] if a container is still open
    /// or no value was ever assigned, and with the packing errors of the
    /// root value.
    pub fn finish(mut self) -> Result<Vec<u8>, Error> {
        if self.stack.len() != 1 {
            return Err(Error::StructuralMismatch("end of input inside an open container"));
        }
        match self.stack.pop() {
            Some(root @ Container::TopLevel { value: Some(_) }) => root.pack(),
            Some(Container::TopLevel { value: None }) => {
                Err(Error::StructuralMismatch("document has no value"))
            }
            _ => Err(Error::StructuralMismatch("top-level slot missing")),
        }
    }

    fn current(&mut self) -> Result<&mut Container, Error> {
        self.stack
            .last_mut()
            .ok_or(Error::StructuralMismatch("container stack is empty"))
    }

    fn assign(&mut self, scalar: Scalar) -> Result<(), Error> {
        let slot = self.current()?.pending_slot()?;
        if slot.is_some() {
            return Err(Error::StructuralMismatch("value assigned twice to one slot"));
        }
        *slot = Some(scalar);
        Ok(())
    }

    fn open(&mut self, container: Container) -> Result<(), Error> {
        if self.current()?.pending_slot()?.is_some() {
            return Err(Error::StructuralMismatch("value assigned twice to one slot"));
        }
        if self.depth() >= self.max_depth {
            return Err(Error::StructuralMismatch("containers nested beyond the depth limit"));
        }
        self.stack.push(container);
        Ok(())
    }

    fn close(&mut self, object: bool) -> Result<(), Error> {
        let matches = match self.stack.last() {
            Some(Container::Object { .. }) => object,
            Some(Container::Array { .. }) => !object,
            _ => false,
        };
        if !matches {
            return Err(Error::StructuralMismatch(if object {
                "object end without a matching object start"
            } else {
                "array end without a matching array start"
            }));
        }

        let container = self
            .stack
            .pop()
            .ok_or(Error::StructuralMismatch("container stack is empty"))?;
        let name = container.name();
        let packed = container.pack()?;
        trace!(
            container = name,
            packed_len = packed.len(),
            depth = self.depth(),
            "packed closed container"
        );
        self.assign(Scalar::PreEncoded(packed))
    }
}

impl EventSink for TreeBuilder {
    fn event(&mut self, event: StructuralEvent) -> Result<(), Error> {
        match event {
            StructuralEvent::ObjectStart => self.open(Container::Object { fields: Vec::new() }),
            StructuralEvent::ArrayStart => self.open(Container::Array {
                elements: Vec::new(),
            }),
            StructuralEvent::ObjectEnd => self.close(true),
            StructuralEvent::ArrayEnd => self.close(false),
            StructuralEvent::FieldStart { name } => match self.current()? {
                Container::Object { fields } => {
                    fields.push(Field {
                        key: name,
                        value: None,
                    });
                    Ok(())
                }
                _ => Err(Error::StructuralMismatch("field start outside an object")),
            },
            StructuralEvent::ElementStart => match self.current()? {
                Container::Array { elements } => {
                    elements.push(None);
                    Ok(())
                }
                _ => Err(Error::StructuralMismatch("element start outside an array")),
            },
            StructuralEvent::Scalar { token, kind } => self.assign(Scalar::Token { text: token, kind }),
        }
    }
}
