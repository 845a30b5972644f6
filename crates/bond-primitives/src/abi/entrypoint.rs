use alloy::sol;
use serde::{Deserialize, Serialize};

// EntryPoint v0.6, https://github.com/eth-infinitism/account-abstraction/tree/releases/v0.6
sol! {
    /// UserOperation as consumed by EntryPoint v0.6 and the bundler JSON-RPC api.
    #[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
    struct UserOperation {
        address sender;
        uint256 nonce;
        bytes initCode;
        bytes callData;
        uint256 callGasLimit;
        uint256 verificationGasLimit;
        uint256 preVerificationGas;
        uint256 maxFeePerGas;
        uint256 maxPriorityFeePerGas;
        bytes paymasterAndData;
        bytes signature;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IEntryPoint {
        error SenderAddressResult(address sender);

        function getNonce(address sender, uint192 key) external view returns (uint256 nonce);

        /// always reverts with `SenderAddressResult`
        function getSenderAddress(bytes calldata initCode) external;

        function getUserOpHash(UserOperation calldata userOp) external view returns (bytes32 userOpHash);
    }
}
