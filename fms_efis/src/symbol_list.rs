/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use crate::nd_symbol::NdSymbol;

/// the working list of one symbol pass. Symbols are identified by their `database_id`
#[derive(Debug,Clone,Default)]
pub struct SymbolList {
    symbols: Vec<NdSymbol>,
}

impl SymbolList {
    pub fn new ()->Self { SymbolList::default() }

    #[inline] pub fn len (&self)->usize { self.symbols.len() }
    #[inline] pub fn is_empty (&self)->bool { self.symbols.is_empty() }

    pub fn get (&self, database_id: &str)->Option<&NdSymbol> {
        self.symbols.iter().find( |s| s.database_id == database_id)
    }

    pub fn iter (&self)->impl Iterator<Item=&NdSymbol> { self.symbols.iter() }

    /// insert or merge a symbol. The touched entry always ends up at the tail of the list
    pub fn upsert (&mut self, symbol: NdSymbol) {
        if let Some(pos) = self.symbols.iter().position( |s| s.database_id == symbol.database_id) {
            let mut existing = self.symbols.remove( pos);
            existing.merge( symbol);
            self.symbols.push( existing);
        } else {
            self.symbols.push( symbol);
        }
    }

    pub fn upsert_all<I> (&mut self, symbols: I) where I: IntoIterator<Item=NdSymbol> {
        for s in symbols { self.upsert( s) }
    }

    /// the list in transmission order, capped at `max_symbols`. The most recently touched symbols
    /// come first and survive the cut. The flag is set if symbols had to be dropped
    pub fn into_transmission_order (self, max_symbols: usize)->(Vec<NdSymbol>,bool) {
        let mut symbols = self.symbols;
        symbols.reverse();
        let limit_reached = symbols.len() > max_symbols;
        symbols.truncate( max_symbols);
        (symbols, limit_reached)
    }
}
