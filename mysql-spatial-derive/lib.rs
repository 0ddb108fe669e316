use lazy_static::lazy_static;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashMap;
use syn::{
    parse2, Attribute, DeriveInput, Field, GenericArgument, Ident, Lit, Meta, MetaNameValue,
    NestedMeta, PathArguments, Type, TypePath,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum SqlType {
    /// A `ColumnType` expression
    Column(&'static str),
    /// A `SpatialType` variant
    Spatial(&'static str),
}

lazy_static! {
    static ref COLUMN_TYPES: HashMap<&'static str, SqlType> = {
        let mut m = HashMap::new();
        m.insert("i64", SqlType::Column("BigInteger"));
        m.insert("i32", SqlType::Column("Integer"));
        m.insert("u32", SqlType::Column("Integer"));
        m.insert("f64", SqlType::Column("Double"));
        m.insert("bool", SqlType::Column("Boolean"));
        m.insert("String", SqlType::Column("String(255)"));
        m.insert("Geometry", SqlType::Spatial("Geometry"));
        m.insert("Point", SqlType::Spatial("Point"));
        m.insert("LineString", SqlType::Spatial("LineString"));
        m.insert("Polygon", SqlType::Spatial("Polygon"));
        m.insert("MultiPoint", SqlType::Spatial("MultiPoint"));
        m.insert("MultiLineString", SqlType::Spatial("MultiLineString"));
        m.insert("MultiPolygon", SqlType::Spatial("MultiPolygon"));
        m.insert("GeometryCollection", SqlType::Spatial("GeometryCollection"));
        m
    };
}

/// Derives `mysql_spatial::SpatialModel` for a struct with named fields.
///
/// - `#[table_name = "..."]` on the struct sets the table, the struct name is used otherwise.
/// - The primary key is the field marked `#[primary_key]`, or the field named `id`. It
///   must be an `Option<i64>`, `None` until the row is inserted.
/// - `#[spatial_field]` or `#[spatial_field(srid = 4326)]` marks a geometry field as one of
///   the model's spatial fields. Geometry fields without it are still stored, but the
///   spatial scopes refuse them.
/// - An `Option<T>` field is a nullable column.
///
/// # Usage
/// ```ignore
/// use mysql_spatial::{Point, Polygon, SpatialModel};
///
/// #[derive(SpatialModel)]
/// #[table_name = "geometry"]
/// struct GeometryModel {
///     id: Option<i64>,
///     name: Option<String>,
///     #[spatial_field]
///     location: Point,
///     #[spatial_field(srid = 3857)]
///     shape: Option<Polygon>,
/// }
/// ```
#[proc_macro_derive(SpatialModel, attributes(table_name, primary_key, spatial_field))]
pub fn derive_spatial_model(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let inner_input = proc_macro2::TokenStream::from(input);
    proc_macro::TokenStream::from(derive_spatial_model_inner(inner_input))
}

fn derive_spatial_model_inner(input: TokenStream) -> TokenStream {
    let ast = parse2::<DeriveInput>(input).expect("SpatialModel derive expected a struct");
    let table_name = get_meta_attr(&ast.attrs, "table_name")
        .map(|meta| match meta {
            Meta::NameValue(MetaNameValue {
                lit: Lit::Str(ls), ..
            }) => ls.value(),
            _ => panic!("table_name must be given as #[table_name = \"...\"]"),
        })
        .unwrap_or_else(|| ast.ident.to_string());

    let fields = match &ast.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => fields.named.iter().collect::<Vec<&Field>>(),
            _ => panic!("SpatialModel derive expected named fields"),
        },
        _ => panic!("SpatialModel derive expected a struct"),
    };

    let field_infos = fields.iter().map(|f| field_info(f)).collect::<Vec<FieldInfo>>();
    impl_model(&ast, &table_name, &field_infos)
}

fn get_meta_attr(attrs: &[Attribute], name: &str) -> Option<Meta> {
    attrs
        .iter()
        .filter_map(|attr| attr.parse_meta().ok())
        .filter(|meta| match meta.path().get_ident() {
            Some(i) => i == name,
            None => false,
        })
        .last()
}

#[derive(Debug, Clone, PartialEq)]
struct FieldInfo {
    ident: Ident,
    name: String,
    sql_type: SqlType,
    nullable: bool,
    primary_key: bool,
    // Some when the field carries #[spatial_field]
    spatial: Option<Option<u32>>,
}

// the last path segment and whether it was wrapped in an Option
fn get_path_type_name(p: &TypePath) -> (String, bool) {
    let final_segment = p
        .path
        .segments
        .last()
        .expect("Expected a type with at least one path segment");
    if final_segment.ident == "Option" {
        if let PathArguments::AngleBracketed(a) = &final_segment.arguments {
            assert!(a.args.len() == 1, "Only one argument allowed in an Option");
            if let Some(GenericArgument::Type(Type::Path(inner))) = a.args.first() {
                let (name, inner_optional) = get_path_type_name(inner);
                assert!(!inner_optional, "Nested Option types are not supported");
                return (name, true);
            }
        }
        panic!("Unsupported use of the Option type");
    }
    (final_segment.ident.to_string(), false)
}

fn get_spatial_attr(field: &Field) -> Option<Option<u32>> {
    let meta = get_meta_attr(&field.attrs, "spatial_field")?;
    match meta {
        Meta::Path(_) => Some(None),
        Meta::List(list) => {
            let mut srid = None;
            for nested in list.nested.iter() {
                match nested {
                    NestedMeta::Meta(Meta::NameValue(MetaNameValue {
                        path,
                        lit: Lit::Int(value),
                        ..
                    })) if path.is_ident("srid") => {
                        srid = Some(
                            value
                                .base10_parse::<u32>()
                                .expect("srid must be an unsigned integer"),
                        );
                    }
                    _ => panic!("spatial_field only accepts an srid, e.g. #[spatial_field(srid = 4326)]"),
                }
            }
            Some(srid)
        }
        Meta::NameValue(_) => {
            panic!("spatial_field only accepts an srid, e.g. #[spatial_field(srid = 4326)]")
        }
    }
}

fn field_info(field: &Field) -> FieldInfo {
    let ident = field.ident.clone().expect("Expected named field");
    let name = ident.to_string();
    let (type_name, nullable) = match &field.ty {
        Type::Path(tp) => get_path_type_name(tp),
        _ => panic!("Don't know how to map {} to a column type", name),
    };
    let sql_type = *COLUMN_TYPES
        .get(type_name.as_str())
        .unwrap_or_else(|| panic!("Don't know how to map {} to a column type", type_name));
    let spatial = get_spatial_attr(field);
    if spatial.is_some() && !matches!(sql_type, SqlType::Spatial(_)) {
        panic!("{} is marked as a spatial field but {} is not a geometry type", name, type_name);
    }
    let primary_key = field.attrs.iter().any(|a| a.path.is_ident("primary_key"));
    FieldInfo {
        ident,
        name,
        sql_type,
        nullable,
        primary_key,
        spatial,
    }
}

fn find_primary_key(fields: &[FieldInfo]) -> &FieldInfo {
    let marked = fields.iter().filter(|f| f.primary_key).collect::<Vec<&FieldInfo>>();
    assert!(
        marked.len() <= 1,
        "Found {} primary_key fields, 1 is the maximum allowed amount",
        marked.len()
    );
    let key = marked
        .first()
        .copied()
        .or_else(|| fields.iter().find(|f| f.name == "id"))
        .expect("SpatialModel derive needs an `id` field or a field marked #[primary_key]");
    assert!(
        key.nullable && key.sql_type == SqlType::Column("BigInteger"),
        "The primary key {} must be an Option<i64>",
        key.name
    );
    key
}

fn column_type_tokens(field: &FieldInfo) -> TokenStream {
    match field.sql_type {
        SqlType::Column(expr) => {
            let expr: TokenStream = expr
                .parse()
                .expect("Unable to convert column type into token stream");
            quote!(::mysql_spatial::schema::ColumnType::#expr)
        }
        SqlType::Spatial(kind) => {
            let kind = format_ident!("{}", kind);
            let srid = match field.spatial {
                Some(Some(srid)) if srid != 0 => quote!(::std::option::Option::Some(#srid)),
                _ => quote!(::std::option::Option::None),
            };
            quote!(::mysql_spatial::schema::ColumnType::Spatial {
                kind: ::mysql_spatial::schema::SpatialType::#kind,
                srid: #srid,
            })
        }
    }
}

fn impl_model(ast: &DeriveInput, table_name: &str, fields: &[FieldInfo]) -> TokenStream {
    let name = &ast.ident;
    let model_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let key = find_primary_key(fields);
    let key_ident = &key.ident;
    let key_name = &key.name;

    let column_names = fields.iter().map(|f| f.name.clone()).collect::<Vec<String>>();
    let spatial_fields = fields
        .iter()
        .filter(|f| f.spatial.is_some())
        .map(|f| f.name.clone())
        .collect::<Vec<String>>();

    let attributes = fields
        .iter()
        .filter(|f| f.name != key.name)
        .map(|f| {
            let ident = &f.ident;
            let column = &f.name;
            quote!((#column, ::mysql_spatial::query::Value::from(::std::clone::Clone::clone(&self.#ident))))
        })
        .collect::<Vec<TokenStream>>();

    let row_fields = fields
        .iter()
        .map(|f| {
            let ident = &f.ident;
            let column = &f.name;
            quote!(#ident: row.get(#column)?)
        })
        .collect::<Vec<TokenStream>>();

    let blueprint_columns = fields
        .iter()
        .map(|f| {
            let column = &f.name;
            if f.name == key.name {
                return quote!(blueprint.increments(#column););
            }
            let column_type = column_type_tokens(f);
            let nullable = f.nullable;
            quote!(blueprint.add_column(#column, #column_type, #nullable);)
        })
        .collect::<Vec<TokenStream>>();

    quote!(
        impl #impl_generics ::mysql_spatial::SpatialModel for #name #ty_generics #where_clause {
            const MODEL_NAME: &'static str = #model_name;
            const TABLE_NAME: &'static str = #table_name;
            const PRIMARY_KEY: &'static str = #key_name;
            const COLUMNS: &'static [&'static str] = &[#(#column_names),*];
            const SPATIAL_FIELDS: &'static [&'static str] = &[#(#spatial_fields),*];

            #[inline]
            fn key(&self) -> ::std::option::Option<i64> {
                self.#key_ident
            }

            #[inline]
            fn set_key(&mut self, key: i64) {
                self.#key_ident = ::std::option::Option::Some(key);
            }

            fn attributes(&self) -> ::std::vec::Vec<(&'static str, ::mysql_spatial::query::Value)> {
                ::std::vec![#(#attributes),*]
            }

            fn from_row(row: &::mysql_spatial::rusqlite::Row<'_>) -> ::mysql_spatial::rusqlite::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #(#row_fields,)*
                })
            }

            fn blueprint() -> ::mysql_spatial::schema::Blueprint {
                let mut blueprint = ::mysql_spatial::schema::Blueprint::create(#table_name);
                #(#blueprint_columns)*
                blueprint
            }
        }
    )
}
