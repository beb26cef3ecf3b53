use std::collections::HashMap;

use serde_json::Value;

use treesync_shared::NodeId;

use crate::{element::DisabledUpdateMode, published::ParamType, rpc::RpcError};

pub type MethodHandler = dyn FnMut(&[Value]) -> Result<Value, String>;

/// A component method the client may call by name
pub struct PublishedMethod {
    name: String,
    params: Vec<ParamType>,
    variadic: bool,
    mode: DisabledUpdateMode,
    allow_inert: bool,
    handler: Box<MethodHandler>,
}

impl PublishedMethod {
    pub fn new<F>(name: &str, handler: F) -> Self
    where
        F: FnMut(&[Value]) -> Result<Value, String> + 'static,
    {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            variadic: false,
            mode: DisabledUpdateMode::OnlyWhenEnabled,
            allow_inert: false,
            handler: Box::new(handler),
        }
    }

    pub fn param(mut self, param: ParamType) -> Self {
        self.params.push(param);
        self
    }

    /// Adds a trailing variadic parameter with the given element type. The
    /// handler receives it as one array argument.
    pub fn variadic(mut self, element: ParamType) -> Self {
        self.params.push(ParamType::array(element));
        self.variadic = true;
        self
    }

    pub fn update_mode(mut self, mode: DisabledUpdateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Lets the method be called while its element is inert
    pub fn allow_inert(mut self) -> Self {
        self.allow_inert = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn disabled_update_mode(&self) -> DisabledUpdateMode {
        self.mode
    }

    pub fn allows_inert(&self) -> bool {
        self.allow_inert
    }

    /// Checks the argument count and decodes every argument against its
    /// declared parameter type, folding trailing arguments into the variadic
    /// array.
    pub fn decode_args(&self, args: &[Value]) -> Result<Vec<Value>, RpcError> {
        let declared = self.params.len();
        let supplied = args.len();

        let (variadic_param, fixed) = match self.params.split_last() {
            Some((last, fixed)) if self.variadic => (last, fixed),
            _ => {
                if supplied != declared {
                    return Err(self.arity_error(declared.to_string(), supplied));
                }
                return self
                    .params
                    .iter()
                    .zip(args)
                    .enumerate()
                    .map(|(index, (param, arg))| self.decode_arg(index, param, arg))
                    .collect();
            }
        };

        if supplied < fixed.len() {
            return Err(self.arity_error(format!("at least {}", fixed.len()), supplied));
        }

        let mut decoded = fixed
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, arg))| self.decode_arg(index, param, arg))
            .collect::<Result<Vec<_>, _>>()?;

        let variadic_index = fixed.len();
        let rest = &args[variadic_index..];
        let variadic_arg = match rest {
            [single] if supplied == declared && single.is_array() => single.clone(),
            _ => Value::Array(rest.to_vec()),
        };
        decoded.push(self.decode_arg(variadic_index, variadic_param, &variadic_arg)?);

        Ok(decoded)
    }

    pub fn invoke(&mut self, args: &[Value]) -> Result<Value, String> {
        (self.handler)(args)
    }

    fn decode_arg(&self, index: usize, param: &ParamType, arg: &Value) -> Result<Value, RpcError> {
        param.decode(arg).map_err(|reason| RpcError::InvalidArgument {
            method: self.name.clone(),
            index,
            reason,
        })
    }

    fn arity_error(&self, expected: String, actual: usize) -> RpcError {
        RpcError::ArityMismatch {
            method: self.name.clone(),
            expected,
            actual,
        }
    }
}

/// The published methods declared by one type
pub struct MethodTable {
    type_name: String,
    methods: Vec<PublishedMethod>,
}

impl MethodTable {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: PublishedMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    fn find(&self, name: &str) -> Result<Option<usize>, RpcError> {
        let mut matches = self
            .methods
            .iter()
            .enumerate()
            .filter(|(_, method)| method.name == name)
            .map(|(index, _)| index);
        let first = matches.next();
        let others = matches.count();
        if others > 0 {
            return Err(RpcError::AmbiguousMethod {
                component: self.type_name.clone(),
                method: name.to_string(),
                count: others + 1,
            });
        }
        Ok(first)
    }
}

/// Where a method was found: composite depth, table, method
type MethodLocation = (usize, usize, usize);

/// The server side component mapped to a node.
///
/// Methods are resolved in the component's own table first, then in its base
/// tables in order, then in the component it is a composite of.
pub struct PublishedComponent {
    tables: Vec<MethodTable>,
    content: Option<Box<PublishedComponent>>,
}

impl PublishedComponent {
    pub fn new(type_name: &str) -> Self {
        Self {
            tables: vec![MethodTable::new(type_name)],
            content: None,
        }
    }

    pub fn type_name(&self) -> &str {
        self.tables
            .first()
            .map(MethodTable::type_name)
            .unwrap_or_default()
    }

    /// Adds a method to the component's own table
    pub fn method(mut self, method: PublishedMethod) -> Self {
        if let Some(own) = self.tables.first_mut() {
            own.methods.push(method);
        }
        self
    }

    pub fn base(mut self, table: MethodTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Makes this component a composite wrapping `content`
    pub fn composite_of(mut self, content: PublishedComponent) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    pub fn resolve(&self, name: &str) -> Result<&PublishedMethod, RpcError> {
        let (depth, table, index) = self.locate(name)?.ok_or_else(|| self.not_found(name))?;
        let mut component = self;
        for _ in 0..depth {
            match component.content.as_deref() {
                Some(content) => component = content,
                None => unreachable!("located method lies within the composite chain"),
            }
        }
        Ok(&component.tables[table].methods[index])
    }

    pub fn resolve_mut(&mut self, name: &str) -> Result<&mut PublishedMethod, RpcError> {
        let (depth, table, index) = self.locate(name)?.ok_or_else(|| self.not_found(name))?;
        let mut component = self;
        for _ in 0..depth {
            match component.content.as_deref_mut() {
                Some(content) => component = content,
                None => unreachable!("located method lies within the composite chain"),
            }
        }
        Ok(&mut component.tables[table].methods[index])
    }

    fn locate(&self, name: &str) -> Result<Option<MethodLocation>, RpcError> {
        for (table_index, table) in self.tables.iter().enumerate() {
            if let Some(index) = table.find(name)? {
                return Ok(Some((0, table_index, index)));
            }
        }
        match &self.content {
            Some(content) => Ok(content
                .locate(name)?
                .map(|(depth, table, index)| (depth + 1, table, index))),
            None => Ok(None),
        }
    }

    fn not_found(&self, name: &str) -> RpcError {
        RpcError::MethodNotFound {
            component: self.type_name().to_string(),
            method: name.to_string(),
        }
    }
}

/// Maps nodes to the components published on them
pub trait ComponentLookup {
    fn component_mut(&mut self, node: &NodeId) -> Option<&mut PublishedComponent>;
}

#[derive(Default)]
pub struct ComponentRegistry {
    components: HashMap<NodeId, PublishedComponent>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the component to the node, returning the one it replaces
    pub fn register(&mut self, node: NodeId, component: PublishedComponent) -> Option<PublishedComponent> {
        self.components.insert(node, component)
    }

    pub fn unregister(&mut self, node: &NodeId) -> Option<PublishedComponent> {
        self.components.remove(node)
    }

    pub fn get(&self, node: &NodeId) -> Option<&PublishedComponent> {
        self.components.get(node)
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.components.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentLookup for ComponentRegistry {
    fn component_mut(&mut self, node: &NodeId) -> Option<&mut PublishedComponent> {
        self.components.get_mut(node)
    }
}
